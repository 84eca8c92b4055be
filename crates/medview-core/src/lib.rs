//! Patient profile lookups against an ORDS medical endpoint.
//!
//! ```text
//! raw id ──▶ PatientId::parse ──▶ RecordSource::fetch ──▶ normalize ──▶ ViewState
//!                                   (OrdsClient)          (shape detection,
//!                                                          field catalogue)
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod fields;
pub mod id;
pub mod normalize;
pub mod view;

pub use client::{Fetched, OrdsClient, RecordSource, fetch};
pub use config::{Credentials, EndpointConfig};
pub use error::{Error, ErrorKind, Result};
pub use fields::{Category, FieldKind, FieldSpec};
pub use id::{IdPolicy, PatientId};
pub use normalize::{
    BlankPolicy, DisplayField, FieldGroup, NormalizeOptions, Normalized, Profile, ResponseShape,
    ShapeKind, normalize,
};
pub use view::{Applied, FetchOutcome, StatusLine, Ticket, ViewState, Viewer};
