use sha2::{Digest, Sha256};

/// Stable SHA-256 fingerprint for a forbidden import.
///
/// Identity fields: check_id, code, unit import path, source file, imported path, and
/// `occurrence`, the number of earlier imports of the same path in that file.
/// Line numbers are left out so that unrelated edits do not change the fingerprint.
pub fn fingerprint_for_import(
    check_id: &str,
    code: &str,
    unit: &str,
    file: &str,
    import: &str,
    occurrence: usize,
) -> String {
    let occurrence = occurrence.to_string();
    digest(&[check_id, code, unit, file, import, &occurrence])
}

/// Stable SHA-256 fingerprint for a configuration finding.
pub fn fingerprint_for_config(check_id: &str, code: &str, subject: &[&str]) -> String {
    let mut parts = vec![check_id, code];
    parts.extend_from_slice(subject);
    digest(&parts)
}

fn digest(parts: &[&str]) -> String {
    let canonical = parts.join("|");
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
