// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

use tablemeta::Table;

#[derive(Table)]
pub struct User {
    pub id: u64,
    pub user_name: String
}

fn main() {}
