// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

#[test]
fn compile_pass() {
    let t = trybuild::TestCases::new();
    t.pass("tests/cases/pass/*.rs");
}
