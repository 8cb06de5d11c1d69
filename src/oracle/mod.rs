//! Relay core: WRKChain registration and header recording.
//!
//! # Data Flow
//! ```text
//! register:
//!     genesis.rs (ChainIdentity) + authorised.rs (AuthorisedSet)
//!     → guard.rs (RegisterWrkChain events, sole source of truth)
//!     → fees.rs (deposit + tax + reserve)
//!     → session.rs → dispatcher.rs (awaited submission)
//!
//! record:
//!     poller.rs (tick every `frequency_secs`)
//!     → fees.rs (tax + reserve)
//!     → selector.rs (HeaderRecord from the latest WRKChain header)
//!     → nonce.rs (strictly increasing nonces)
//!     → dispatcher.rs (spawned submission, outcome reported back to the loop)
//! ```

pub mod authorised;
pub mod dispatcher;
pub mod fees;
pub mod genesis;
pub mod guard;
pub mod nonce;
pub mod poller;
pub mod register;
pub mod selector;
pub mod session;

pub use authorised::AuthorisedSet;
pub use dispatcher::{DispatchOutcome, Dispatcher, SubmissionStatus};
pub use fees::{Charge, FeeGuard, RECORD_TAX};
pub use genesis::ChainIdentity;
pub use nonce::NonceSequencer;
pub use poller::{Recorder, TickReport};
pub use register::{Registrar, Registration};
pub use selector::{FieldSelection, HeaderRecord};
pub use session::SigningSession;
