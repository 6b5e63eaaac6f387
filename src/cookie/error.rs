use thiserror::Error;

/// Why a purchase was refused. A refused purchase never changes the state.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PurchaseError {
    #[error("not enough cookies: need {cost}, have {available}")]
    InsufficientResource { cost: f64, available: f64 },
    #[error("{name} was already purchased")]
    AlreadyPurchased { name: String },
    #[error("{name} is not unlocked yet")]
    Locked { name: String },
    #[error("no producer named {kind}")]
    UnknownProducer { kind: String },
    #[error("no upgrade named {name}")]
    UnknownModifier { name: String },
}
