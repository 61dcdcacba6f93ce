// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

use tablemeta::Table;

#[derive(Table)]
#[table(
    name = "t_account",
    schema = "crm",
    result_map = "accountMap",
    keep_global_prefix,
    exclude = "scratch",
    key_sequence = "seq_account"
)]
pub struct Account {
    #[table_id(column = "account_id", id_type = "generator")]
    pub id: u64,
    #[table_field(column = "display_name", strategy = "not_empty")]
    pub name: String,
    #[table_field(exist = false)]
    pub cached_total: i64,
    #[table_field(select = false)]
    pub secret: String,
    #[table_field(fill = "insert_update")]
    pub touched_at: i64,
    pub scratch: String
}

fn main() {}
