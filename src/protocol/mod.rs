//! Protocol module for the ThermaQ wire format.
//!
//! This module contains:
//! - Payload byte layouts
//! - A bounds-checked payload reader
//! - The firmware generation selector
//! - Packet kinds and the `decode_packet` entry point

pub mod generation;
pub mod layout;
pub mod packet;
pub mod reader;

pub use generation::ProtocolGeneration;
pub use packet::{decode_packet, LengthRule, Packet, PacketKind};
pub use reader::PacketReader;
