// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

use tablemeta::Table;

#[derive(Table)]
pub struct BaseEntity {
    #[table_id]
    pub id: u64,
    pub created_at: i64
}

#[derive(Table)]
#[table(extends = "BaseEntity")]
pub struct Customer {
    pub nick_name: Option<String>
}

fn main() {}
