use crate::SignatureError;
use alloy::primitives::{uint, Address, Bytes, Signature, B256, U256};
use serde::{Deserialize, Serialize};

/// Half the secp256k1 curve order. Signatures with a larger `s` are the
/// malleable twin of a valid signature.
const SECP256K1N_HALF: U256 =
    uint!(0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0_U256);

/// A signature over an order digest, as submitted for settlement.
///
/// Every encoding normalizes to the same [`Signature`] before recovery, so a
/// signature recovers to the same signer regardless of how it was relayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderSignature {
    /// Packed bytes: `r ‖ s ‖ v` (65 bytes) or the EIP-2098 compact form
    /// `r ‖ yParityAndS` (64 bytes).
    Packed(Bytes),
    /// Split components.
    Split {
        /// The `r` value.
        r: B256,
        /// The `s` value.
        s: B256,
        /// The recovery id: 0, 1, 27 or 28.
        v: u8,
    },
}

impl From<Signature> for OrderSignature {
    fn from(signature: Signature) -> Self {
        Self::Packed(signature.as_bytes().into())
    }
}

impl From<Bytes> for OrderSignature {
    fn from(bytes: Bytes) -> Self {
        Self::Packed(bytes)
    }
}

impl OrderSignature {
    /// Split a signature into its `(r, s, v)` components, with `v` in the
    /// 27/28 form.
    pub fn split(signature: &Signature) -> Self {
        Self::Split {
            r: B256::from(signature.r().to_be_bytes::<32>()),
            s: B256::from(signature.s().to_be_bytes::<32>()),
            v: 27 + signature.v() as u8,
        }
    }

    /// Encode a signature in the 64-byte EIP-2098 compact form.
    pub fn compact(signature: &Signature) -> Self {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(&signature.r().to_be_bytes::<32>());
        buf[32..].copy_from_slice(&signature.s().to_be_bytes::<32>());
        if signature.v() {
            buf[32] |= 0x80;
        }
        Self::Packed(Bytes::copy_from_slice(&buf))
    }

    /// Decode the signature into its canonical form.
    ///
    /// Fails on a bad length, a recovery id outside `{0, 1, 27, 28}`, or an
    /// upper-half `s` value.
    pub fn normalize(&self) -> Result<Signature, SignatureError> {
        let signature = match self {
            Self::Packed(bytes) => match bytes.len() {
                65 => from_parts(&bytes[..32], &bytes[32..64], bytes[64])?,
                64 => from_compact(&bytes[..32], &bytes[32..]),
                len => return Err(SignatureError::InvalidLength(len)),
            },
            Self::Split { r, s, v } => from_parts(r.as_slice(), s.as_slice(), *v)?,
        };

        if signature.s() > SECP256K1N_HALF {
            return Err(SignatureError::HighS);
        }

        Ok(signature)
    }

    /// Recover the address that signed `digest`.
    pub fn recover(&self, digest: &B256) -> Result<Address, SignatureError> {
        let signer = self
            .normalize()?
            .recover_address_from_prehash(digest)
            .map_err(|_| SignatureError::Unrecoverable)?;

        if signer.is_zero() {
            return Err(SignatureError::ZeroAddress);
        }

        Ok(signer)
    }
}

fn y_parity(v: u8) -> Result<bool, SignatureError> {
    match v {
        0 | 27 => Ok(false),
        1 | 28 => Ok(true),
        v => Err(SignatureError::InvalidRecoveryId(v)),
    }
}

fn from_parts(r: &[u8], s: &[u8], v: u8) -> Result<Signature, SignatureError> {
    Ok(Signature::new(U256::from_be_slice(r), U256::from_be_slice(s), y_parity(v)?))
}

fn from_compact(r: &[u8], y_parity_and_s: &[u8]) -> Signature {
    let mut s = [0u8; 32];
    s.copy_from_slice(y_parity_and_s);
    let y_parity = s[0] & 0x80 != 0;
    s[0] &= 0x7f;
    Signature::new(U256::from_be_slice(r), U256::from_be_bytes(s), y_parity)
}

/// The `[sellerSig, buyerSig]` pair submitted with a settlement.
///
/// The buyer signature may be omitted when the buyer submits a listing
/// settlement themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePair {
    /// The seller's signature.
    pub seller: OrderSignature,
    /// The buyer's (or offer provider's) signature.
    pub buyer: Option<OrderSignature>,
}

impl SignaturePair {
    /// Create a new signature pair.
    pub const fn new(seller: OrderSignature, buyer: OrderSignature) -> Self {
        Self { seller, buyer: Some(buyer) }
    }

    /// Create a pair carrying only the seller's signature.
    pub const fn seller_only(seller: OrderSignature) -> Self {
        Self { seller, buyer: None }
    }
}

impl From<[OrderSignature; 2]> for SignaturePair {
    fn from([seller, buyer]: [OrderSignature; 2]) -> Self {
        Self::new(seller, buyer)
    }
}
