//! metadata::codec
//!
//! Sign-encoded string references for the binary metadata format.
//!
//! # Design
//!
//! The binary format references strings from two disjoint, independently
//! zero-indexed pools — classifier ids and general strings — through a single
//! signed integer id, with no per-reference pool tag:
//!
//! - classifier pool: index `i` (i >= 0) maps to id `-i - 1` (always negative)
//! - general pool:    index `i` (i >= 0) maps to id `i + 1` (always positive)
//!
//! Id `0` never arises and decoding it is an error. Pool membership is
//! determined purely by sign: a reader must route on the sign of the id
//! (via [`decode`]) rather than apply a single pool's decoder, since no
//! self-describing tag exists to catch a mix-up.

use thiserror::Error;

/// Errors from decoding string ids.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Id 0 is outside both pools.
    #[error("string id 0 is invalid")]
    ZeroId,

    /// The id has the wrong sign for the requested pool.
    #[error("string id {id} is not a {pool} pool id")]
    WrongPool {
        id: i32,
        pool: &'static str,
    },
}

/// A decoded string reference: which pool, and the index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolRef {
    /// Index into the classifier-id pool.
    Classifier(i32),
    /// Index into the general string pool.
    General(i32),
}

/// Encode a classifier-pool index as an id. Always negative.
pub fn classifier_index_to_id(index: i32) -> i32 {
    debug_assert!(index >= 0, "pool indexes are non-negative");
    -index - 1
}

/// Decode a classifier-pool id back to its index.
///
/// # Errors
///
/// Returns `CodecError` for id 0 or a positive (general-pool) id.
pub fn classifier_id_to_index(id: i32) -> Result<i32, CodecError> {
    if id == 0 {
        return Err(CodecError::ZeroId);
    }
    if id > 0 {
        return Err(CodecError::WrongPool {
            id,
            pool: "classifier",
        });
    }
    Ok(-(id + 1))
}

/// Encode a general-pool index as an id. Always positive.
pub fn string_index_to_id(index: i32) -> i32 {
    debug_assert!(index >= 0, "pool indexes are non-negative");
    index + 1
}

/// Decode a general-pool id back to its index.
///
/// # Errors
///
/// Returns `CodecError` for id 0 or a negative (classifier-pool) id.
pub fn string_id_to_index(id: i32) -> Result<i32, CodecError> {
    if id == 0 {
        return Err(CodecError::ZeroId);
    }
    if id < 0 {
        return Err(CodecError::WrongPool { id, pool: "general" });
    }
    Ok(id - 1)
}

/// Decode an id into its pool and index, routing on sign.
///
/// # Errors
///
/// Returns `CodecError::ZeroId` for id 0.
///
/// # Example
///
/// ```
/// use graphforge::metadata::codec::{decode, PoolRef};
///
/// assert_eq!(decode(-1).unwrap(), PoolRef::Classifier(0));
/// assert_eq!(decode(3).unwrap(), PoolRef::General(2));
/// assert!(decode(0).is_err());
/// ```
pub fn decode(id: i32) -> Result<PoolRef, CodecError> {
    if id == 0 {
        return Err(CodecError::ZeroId);
    }
    if id < 0 {
        Ok(PoolRef::Classifier(-(id + 1)))
    } else {
        Ok(PoolRef::General(id - 1))
    }
}
