// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Best-effort input sanitizer.
//!
//! Removes angle brackets so free text cannot open tags inside the email
//! provider's template. The provider's own escaping is still the real
//! defense.

/// Strip `<` and `>` and trim surrounding whitespace.
pub fn sanitize_input(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '<' | '>'))
        .collect::<String>()
        .trim()
        .to_string()
}
