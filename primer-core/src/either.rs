// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Two-channel tagged union used to multiplex two logical streams into one.

/// A value holding exactly one of two alternatives.
///
/// The tag identifies which channel an event belongs to. Values are immutable
/// once constructed.
///
/// # Example
///
/// ```
/// use primer_core::Either;
///
/// let event: Either<i32, &str> = Either::Right("a");
/// assert!(event.is_right());
/// assert_eq!(event.right(), Some("a"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Either<L, R> {
    /// Value on the left channel
    Left(L),
    /// Value on the right channel
    Right(R),
}

impl<L, R> Either<L, R> {
    /// Returns `true` if the left branch is active.
    pub const fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    /// Returns `true` if the right branch is active.
    pub const fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    /// Consumes the value and returns the left payload, if active.
    pub fn left(self) -> Option<L> {
        match self {
            Either::Left(l) => Some(l),
            Either::Right(_) => None,
        }
    }

    /// Consumes the value and returns the right payload, if active.
    pub fn right(self) -> Option<R> {
        match self {
            Either::Left(_) => None,
            Either::Right(r) => Some(r),
        }
    }

    /// Borrows the active payload.
    pub const fn as_ref(&self) -> Either<&L, &R> {
        match self {
            Either::Left(l) => Either::Left(l),
            Either::Right(r) => Either::Right(r),
        }
    }

    /// Transforms the left payload, leaving a right payload untouched.
    pub fn map_left<L2, F>(self, f: F) -> Either<L2, R>
    where
        F: FnOnce(L) -> L2,
    {
        match self {
            Either::Left(l) => Either::Left(f(l)),
            Either::Right(r) => Either::Right(r),
        }
    }

    /// Transforms the right payload, leaving a left payload untouched.
    pub fn map_right<R2, F>(self, f: F) -> Either<L, R2>
    where
        F: FnOnce(R) -> R2,
    {
        match self {
            Either::Left(l) => Either::Left(l),
            Either::Right(r) => Either::Right(f(r)),
        }
    }

    /// Swaps the channels.
    pub fn flip(self) -> Either<R, L> {
        match self {
            Either::Left(l) => Either::Right(l),
            Either::Right(r) => Either::Left(r),
        }
    }
}

impl<T> Either<T, T> {
    /// Returns the payload regardless of the active branch.
    pub fn into_inner(self) -> T {
        match self {
            Either::Left(v) | Either::Right(v) => v,
        }
    }
}
