//! Background tasks.
//!
//! Each submodule provides a long-running async function meant for
//! `tokio::spawn`. Tasks stop when their [`CancellationToken`] fires.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod coach_sweep;
