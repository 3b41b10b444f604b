// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Extension traits and the core types they are used with.
//!
//! ```
//! use primer_stream::prelude::*;
//! ```

pub use crate::combine_latest_either::CombineLatestEitherExt;
pub use crate::prime::PrimeExt;
pub use crate::take_until_cancelled::TakeUntilCancelledExt;

pub use primer_core::{
    Connectable, Either, ItemStream, Observer, PrimerError, StreamItem, StreamSource,
    Subscription,
};
