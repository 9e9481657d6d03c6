use alloy::primitives::Address;

/// A signature that cannot be turned into a signer address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// Packed signatures must be 65 bytes, or 64 bytes in compact form.
    #[error("invalid signature length: {0} bytes")]
    InvalidLength(usize),
    /// The recovery id is not one of 0, 1, 27 or 28.
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),
    /// The `s` value is in the upper half of the curve order. Only the
    /// lower-half form of a signature is accepted.
    #[error("malleable signature: s value is in the upper half of the curve order")]
    HighS,
    /// No public key could be recovered from the signature.
    #[error("unable to recover signer")]
    Unrecoverable,
    /// The signature recovered to the zero address.
    #[error("signature recovered to the zero address")]
    ZeroAddress,
}

/// An error that can occur when signing an order.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    /// The signer is not the party the order names.
    #[error("signer {actual} cannot sign for order party {expected}")]
    WrongSigner {
        /// The party named by the order.
        expected: Address,
        /// The address of the signer.
        actual: Address,
    },
    /// Error signing the order hash.
    #[error(transparent)]
    Signer(#[from] alloy::signers::Error),
}
