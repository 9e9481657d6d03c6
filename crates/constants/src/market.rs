use crate::{
    load_address, load_string_opt, load_u64, ConfigError, GALLERY_DOMAIN_NAME,
    GALLERY_DOMAIN_VERSION,
};
use alloy::primitives::Address;
use std::borrow::Cow;

/// Environment variable holding the chain id.
const CHAIN_ID_ENV: &str = "GALLERY_CHAIN_ID";
/// Environment variable holding the settlement contract address.
const MARKET_ENV: &str = "GALLERY_MARKET_ADDRESS";
/// Environment variable holding the registry operator address.
const OPERATOR_ENV: &str = "GALLERY_OPERATOR_ADDRESS";
/// Environment variable overriding the EIP-712 domain name.
const NAME_ENV: &str = "GALLERY_DOMAIN_NAME";
/// Environment variable overriding the EIP-712 domain version.
const VERSION_ENV: &str = "GALLERY_DOMAIN_VERSION";

/// Deployment constants for a gallery marketplace.
///
/// Signers and the settlement contract both derive the EIP-712 domain from
/// these values, so two parties agree on a digest only if they agree on every
/// field here.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketConstants {
    /// EIP-712 domain name.
    name: Cow<'static, str>,
    /// EIP-712 domain version.
    version: Cow<'static, str>,
    /// Chain the market settles on.
    chain_id: u64,
    /// Address of the settlement contract.
    market: Address,
    /// Address allowed to add quote tokens.
    operator: Address,
}

impl MarketConstants {
    /// Create a new set of constants with the default gallery domain name
    /// and version.
    pub const fn new(chain_id: u64, market: Address, operator: Address) -> Self {
        Self {
            name: Cow::Borrowed(GALLERY_DOMAIN_NAME),
            version: Cow::Borrowed(GALLERY_DOMAIN_VERSION),
            chain_id,
            market,
            operator,
        }
    }

    /// Override the EIP-712 domain name and version.
    pub fn with_domain(
        self,
        name: impl Into<Cow<'static, str>>,
        version: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self { name: name.into(), version: version.into(), ..self }
    }

    /// Get the hard-coded local test constants.
    #[cfg(any(test, feature = "test-utils"))]
    pub const fn test() -> Self {
        crate::test_utils::TEST_MARKET
    }

    /// Load the constants from the environment.
    ///
    /// Reads `GALLERY_CHAIN_ID`, `GALLERY_MARKET_ADDRESS` and
    /// `GALLERY_OPERATOR_ADDRESS`. The domain name and version default to
    /// [`GALLERY_DOMAIN_NAME`] and [`GALLERY_DOMAIN_VERSION`] unless
    /// `GALLERY_DOMAIN_NAME` / `GALLERY_DOMAIN_VERSION` are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let chain_id = load_u64(CHAIN_ID_ENV)?;
        let market = load_address(MARKET_ENV)?;
        let operator = load_address(OPERATOR_ENV)?;

        let name = load_string_opt(NAME_ENV)
            .map(Cow::Owned)
            .unwrap_or(Cow::Borrowed(GALLERY_DOMAIN_NAME));
        let version = load_string_opt(VERSION_ENV)
            .map(Cow::Owned)
            .unwrap_or(Cow::Borrowed(GALLERY_DOMAIN_VERSION));

        Ok(Self { name, version, chain_id, market, operator })
    }

    /// Load the constants from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Get the EIP-712 domain name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the EIP-712 domain version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Get the chain id.
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Get the settlement contract address.
    pub const fn market(&self) -> Address {
        self.market
    }

    /// Get the registry operator address.
    pub const fn operator(&self) -> Address {
        self.operator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TEST_CHAIN_ID, TEST_MARKET_ADDRESS, TEST_OPERATOR};

    #[test]
    fn test_constants_use_gallery_domain() {
        let constants = MarketConstants::test();
        assert_eq!(constants.name(), "NFTGallery721");
        assert_eq!(constants.version(), "1");
        assert_eq!(constants.chain_id(), TEST_CHAIN_ID);
        assert_eq!(constants.market(), TEST_MARKET_ADDRESS);
        assert_eq!(constants.operator(), TEST_OPERATOR);
    }

    #[test]
    fn json_roundtrip() {
        let constants = MarketConstants::test().with_domain("OtherGallery", "2");
        let json = serde_json::to_string(&constants).unwrap();
        assert!(json.contains("\"chainId\""));

        let parsed = MarketConstants::from_json(&json).unwrap();
        assert_eq!(parsed, constants);
        assert_eq!(parsed.name(), "OtherGallery");
        assert_eq!(parsed.version(), "2");
    }

    #[test]
    fn json_missing_field() {
        let err = MarketConstants::from_json(r#"{"name":"NFTGallery721"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    // Single test touching the process environment, so parallel tests never
    // observe each other's variables.
    #[test]
    fn load_from_env() {
        std::env::remove_var(CHAIN_ID_ENV);
        assert!(matches!(MarketConstants::from_env(), Err(ConfigError::Var(_))));

        std::env::set_var(CHAIN_ID_ENV, "31337");
        std::env::set_var(MARKET_ENV, "0x2222222222222222222222222222222222222222");
        std::env::set_var(OPERATOR_ENV, "0x3333333333333333333333333333333333333333");

        let constants = MarketConstants::from_env().unwrap();
        assert_eq!(constants.chain_id(), 31337);
        assert_eq!(constants.market(), Address::repeat_byte(0x22));
        assert_eq!(constants.operator(), Address::repeat_byte(0x33));
        assert_eq!(constants.name(), GALLERY_DOMAIN_NAME);

        std::env::set_var(NAME_ENV, "Renamed");
        assert_eq!(MarketConstants::from_env().unwrap().name(), "Renamed");

        std::env::set_var(CHAIN_ID_ENV, "not-a-number");
        assert!(matches!(MarketConstants::from_env(), Err(ConfigError::Parse(_))));

        std::env::set_var(CHAIN_ID_ENV, "1");
        std::env::set_var(MARKET_ENV, "0xnothex");
        assert!(matches!(MarketConstants::from_env(), Err(ConfigError::Hex(_))));

        for key in [CHAIN_ID_ENV, MARKET_ENV, OPERATOR_ENV, NAME_ENV, VERSION_ENV] {
            std::env::remove_var(key);
        }
    }
}
