// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

use tablemeta::Table;

#[derive(Table)]
#[table(name = "t_order", auto_result_map)]
pub struct Order {
    #[table_id(id_type = "input")]
    pub id: u64,
    pub amount: i64,
    #[logic_delete(value = "now()", not_value = "null")]
    pub deleted_at: Option<i64>,
    #[version]
    pub revision: u32
}

fn main() {}
