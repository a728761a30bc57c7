//! # alerthub-adapter-serial
//!
//! Device adapter — reads the detector unit's byte stream and decodes it into
//! [`RawEvent`](alerthub_domain::event::RawEvent)s for the gateway.
//!
//! ## Wire format
//!
//! One event per line, `<DEVICE_CODE>:<VALUE>\n`, ASCII/UTF-8. Surrounding
//! whitespace and a trailing `\r` are ignored; codes and values are
//! uppercased. Blank and malformed lines are skipped.
//!
//! ## Transports
//!
//! | Address | Transport |
//! |---------|-----------|
//! | `/dev/ttyUSB0`, `COM5`, ... | serial port at `baud_rate` |
//! | `tcp://host:port` | TCP socket (serial bridges, simulators) |
//!
//! ## Dependency rule
//!
//! Depends on `alerthub-domain` only; the gateway loop lives in
//! `alerthub-app` and receives events over a channel.

mod config;
pub mod decoder;
mod error;
mod reader;
pub mod transport;

pub use config::{TCP_SCHEME, TransportConfig};
pub use decoder::{LineDecoder, MAX_LINE_LEN};
pub use error::SerialError;
pub use reader::{DeviceReader, ReaderHandle};
pub use transport::{LineSource, SerialSource, TcpSource};
