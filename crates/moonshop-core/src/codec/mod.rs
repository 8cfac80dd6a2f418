//! # Cart Token Codec
//!
//! ## Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  token    CartTokenCodec: encode / decode / inspect                    │
//! │    │                                                                    │
//! │    ├── payload   "<records>|<minutes>"                                 │
//! │    │     └── item      compact "S00111:2" or verbose "Id:2"           │
//! │    ├── base62    bytes ⇄ big integer ⇄ base-62 text                    │
//! │    └── digest    truncated SHA-256, prefix acceptance                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod base62;
pub mod digest;
pub mod item;
pub mod payload;
pub mod token;

pub use item::{
    decode_item, encode_item, parse_record, verbose_record, ItemRecord, POSITION_CAPACITY,
};
pub use payload::{build_payload, parse_payload, Payload};
pub use token::{
    CartTokenCodec, CodecConfig, RecordInspection, RecordShape, TokenInspection, TOKEN_SEPARATOR,
};
