//! genbase-calldict - call-record capture.
//!
//! A [`Signature`] is a static parameter schema. [`capture`] pairs it with a
//! callable; every call binds the actual arguments against the schema
//! (defaults applied) and, for callables that declare a keyword catch-all or
//! the reserved [`CALL_RECORD_PARAM`], builds a [`CallRecord`] describing the
//! call. Method receivers appear in the record only as a normalized
//! snapshot.

mod capture;
mod record;
mod signature;

pub use capture::{capture, Captured, Invocation};
pub use record::{normalize_receiver, CallRecord, NAME_KEY};
pub use signature::{
    BindingError, BoundArguments, Param, ParamKind, Signature, SignatureError, CALL_RECORD_PARAM,
    RECEIVER_PARAM,
};
