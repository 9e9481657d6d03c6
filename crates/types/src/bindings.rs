//! EIP-712 struct definitions signed by marketplace participants.
//!
//! The struct names are part of each type hash, so a `DirectSell` and an
//! `Offer` with identical field values never share a digest.
#![allow(missing_docs)]

alloy::sol! {
    /// Terms of a fixed-price listing, signed by the seller.
    #[derive(Debug, PartialEq, Eq)]
    struct DirectSell {
        address seller;
        address quoteToken;
        uint256 price;
        uint256 deadline;
        address nftAddress;
        uint256 nftId;
    }

    /// Terms of an offer on a specific asset. Signed by the offer provider
    /// with the offer deadline, and by the accepting seller with the sale
    /// deadline.
    #[derive(Debug, PartialEq, Eq)]
    struct Offer {
        address offerProvider;
        address quoteToken;
        uint256 price;
        uint256 deadline;
        address nftAddress;
        uint256 nftId;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::SolStruct;

    #[test]
    fn type_strings() {
        assert_eq!(
            DirectSell::eip712_encode_type(),
            "DirectSell(address seller,address quoteToken,uint256 price,uint256 deadline,address nftAddress,uint256 nftId)"
        );
        assert_eq!(
            Offer::eip712_encode_type(),
            "Offer(address offerProvider,address quoteToken,uint256 price,uint256 deadline,address nftAddress,uint256 nftId)"
        );
    }
}
