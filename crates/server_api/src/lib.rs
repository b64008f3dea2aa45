pub mod session;
pub mod validator;

pub use session::{
    SessionController, SessionError, SessionReport, SessionState, SubmissionOutcome,
};
pub use validator::{validate, ValidationError};
