//! Settlement through a `SharedMarket` from many threads at once.

use alloy::primitives::U256;
use gallery_market::{AssetLedger, QuoteTokenLedger, SettlementError};
use gallery_test_utils::{
    init_tracing,
    scenario::{
        asset, buyer, listing, offer, seller, shared_gallery_market, sign_listing, sign_offer,
        sign_relayed_listing, BUYER_FUNDS,
    },
    test_constants::TEST_QUOTE_TOKEN,
    users::RELAYER,
};
use std::thread;

const ATTEMPTS: usize = 8;

#[tokio::test]
async fn concurrent_attempts_settle_once() {
    init_tracing();
    let market = shared_gallery_market();
    let domain = market.lock().domain().clone();
    let order = listing(1, 2, 1000);
    let signatures = sign_listing(&domain, &order).await.unwrap();

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..ATTEMPTS)
            .map(|_| {
                let market = market.clone();
                let signatures = &signatures;
                scope.spawn(move || market.execute_sell(buyer(), &order, signatures))
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    let settled = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(settled, 1);
    for result in results.iter().filter(|result| result.is_err()) {
        assert_eq!(result, &Err(SettlementError::AlreadySettled(order.order_key())));
    }

    let market = market.lock();
    assert_eq!(market.ledger().owner_of(&asset(1)), Some(buyer()));
    assert_eq!(market.ledger().balance_of(TEST_QUOTE_TOKEN, seller()), U256::from(2));
    assert_eq!(
        market.ledger().balance_of(TEST_QUOTE_TOKEN, buyer()),
        BUYER_FUNDS - U256::from(2)
    );
    assert_eq!(market.records().len(), 1);
}

#[tokio::test]
async fn distinct_orders_settle_in_parallel() {
    let market = shared_gallery_market();
    let domain = market.lock().domain().clone();

    let mut listings = Vec::new();
    for id in 1..=4 {
        let order = listing(id, 1, 1000);
        let signatures = sign_listing(&domain, &order).await.unwrap();
        listings.push((order, signatures));
    }
    let mut offers = Vec::new();
    for id in 5..=8 {
        let order = offer(id, 1, 1000, 2000);
        let signatures = sign_offer(&domain, &order).await.unwrap();
        offers.push((order, signatures));
    }

    thread::scope(|scope| {
        for (order, signatures) in &listings {
            let market = market.clone();
            scope.spawn(move || market.execute_sell(buyer(), order, signatures).unwrap());
        }
        for (order, signatures) in &offers {
            let market = market.clone();
            scope.spawn(move || market.execute_offer(seller(), order, signatures).unwrap());
        }
    });

    let market = market.lock();
    for id in 1..=8 {
        assert_eq!(market.ledger().owner_of(&asset(id)), Some(buyer()));
    }
    assert_eq!(market.ledger().balance_of(TEST_QUOTE_TOKEN, seller()), U256::from(8));
    assert_eq!(market.records().len(), 8);
}

#[tokio::test]
async fn relayers_settle_through_shared_handle() {
    let market = shared_gallery_market();
    let domain = market.lock().domain().clone();
    let relayer = RELAYER.address();

    let sell = listing(1, 2, 1000);
    let sell_signatures = sign_relayed_listing(&domain, &sell).await.unwrap();
    let accept = offer(2, 3, 1000, 2000);
    let accept_signatures = sign_offer(&domain, &accept).await.unwrap();

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..ATTEMPTS)
            .map(|_| {
                let market = market.clone();
                let (sell_signatures, accept_signatures) = (&sell_signatures, &accept_signatures);
                scope.spawn(move || {
                    (
                        market.execute_sell_for(relayer, buyer(), &sell, sell_signatures),
                        market.execute_offer_for(relayer, seller(), &accept, accept_signatures),
                    )
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|(sold, _)| sold.is_ok()).count(), 1);
    assert_eq!(results.iter().filter(|(_, accepted)| accepted.is_ok()).count(), 1);

    let market = market.lock();
    assert_eq!(market.ledger().owner_of(&asset(1)), Some(buyer()));
    assert_eq!(market.ledger().owner_of(&asset(2)), Some(buyer()));
    assert_eq!(market.ledger().balance_of(TEST_QUOTE_TOKEN, seller()), U256::from(5));
    assert_eq!(market.ledger().balance_of(TEST_QUOTE_TOKEN, relayer), U256::ZERO);
}
