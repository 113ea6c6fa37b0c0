//! Core of the Cosmic Defender arcade shooter.
//!
//! The library owns the whole simulation: session state, the per-tick update,
//! tuning configuration and the render snapshot handed to front ends. Nothing
//! in here touches the terminal; see the `cosmic_defender` binary for that.

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod input;
pub mod snapshot;
