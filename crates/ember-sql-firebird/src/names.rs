//! Deterministic names for schema objects.
//!
//! Firebird caps identifiers at 31 characters, so generator, trigger and
//! constraint names are derived from table/column names by prefix
//! truncation plus a fixed suffix tag. Constraint names additionally carry
//! a hash of the referencing relationship so two foreign keys that share a
//! column name still get distinct constraints.
//!
//! All of these are pure functions of their inputs: the same names come out
//! on every call and in every process. The hash is FNV-1a, not the standard
//! library's randomized hasher.

/// Engine maximum identifier length.
pub const MAX_NAME_LENGTH: usize = 31;

/// Truncates a name to at most `length` characters (plain prefix cut).
#[must_use]
pub fn truncate_name(name: &str, length: usize) -> &str {
    match name.char_indices().nth(length) {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}

/// Strips one level of surrounding double quotes, if present.
#[must_use]
pub fn strip_quotes(name: &str) -> &str {
    name.strip_prefix('"')
        .and_then(|n| n.strip_suffix('"'))
        .unwrap_or(name)
}

/// Name of the sequence generator emulating auto-increment for `table`.
///
/// One generator per table: the surrounding framework allows a single
/// auto-increment column per model.
#[must_use]
pub fn generator_name(table: &str) -> String {
    let stem = truncate_name(strip_quotes(table), MAX_NAME_LENGTH - 2);
    format!("{}$G", stem.to_uppercase())
}

/// Name of the before-insert trigger bound to the table's generator.
#[must_use]
pub fn trigger_name(table: &str) -> String {
    let stem = truncate_name(strip_quotes(table), MAX_NAME_LENGTH - 2);
    format!("{}$T", stem.to_uppercase())
}

/// Name of the foreign-key constraint from `table.col` to `reftable.refcol`.
///
/// The column pair forms a readable stem; the table pair is hashed so the
/// name stays unique per referencing relationship even when column names
/// repeat across tables.
#[must_use]
pub fn reference_name(col: &str, refcol: &str, table: &str, reftable: &str) -> String {
    let base = format!("{refcol}${col}");
    let base = truncate_name(&base, MAX_NAME_LENGTH - 5);
    let hash = fnv1a(&[reftable.as_bytes(), b"\0", table.as_bytes()]);
    let full = format!("{base}${hash:x}");
    truncate_name(&full, MAX_NAME_LENGTH).to_uppercase()
}

/// FNV-1a 64-bit over a sequence of byte chunks.
fn fnv1a(chunks: &[&[u8]]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET_BASIS;
    for chunk in chunks {
        for byte in *chunk {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(PRIME);
        }
    }
    hash
}
