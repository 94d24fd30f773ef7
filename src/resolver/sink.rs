//! Component sinks
//!
//! Turning component bytes into something runnable is the caller's job. A
//! sink receives each resolved component and returns whatever the caller
//! makes of it.

use crate::error::ArcIndexResult;

/// Consumer of resolved component bytes
pub trait ComponentSink {
    /// What the sink produces from one component
    type Unit;

    fn define(&self, name: &str, bytes: Vec<u8>) -> ArcIndexResult<Self::Unit>;
}

impl<F, U> ComponentSink for F
where
    F: Fn(&str, Vec<u8>) -> ArcIndexResult<U>,
{
    type Unit = U;

    fn define(&self, name: &str, bytes: Vec<u8>) -> ArcIndexResult<U> {
        self(name, bytes)
    }
}
