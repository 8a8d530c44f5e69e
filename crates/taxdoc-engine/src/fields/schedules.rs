//! Schedule C (sole proprietorship) and Schedule E (rents and royalties)

use super::{add_source, sum_sources};
use crate::extractors::{first_positive, labeled};
use lazy_static::lazy_static;
use regex::Regex;
use taxdoc_types::FinancialFields;

lazy_static! {
    static ref GROSS_RECEIPTS: Vec<Regex> = vec![
        labeled(r"gross\s+receipts\s+or\s+sales"),
        labeled(r"gross\s+receipts"),
        labeled(r"\bline\s*1\b"),
    ];
    static ref C_EXPENSES: Vec<Regex> = vec![
        labeled(r"total\s+expenses\s+before\s+expenses\s+for\s+business\s+use\s+of\s+home"),
        labeled(r"total\s+expenses"),
        labeled(r"\bline\s*28\b"),
    ];
    static ref NET_PROFIT: Vec<Regex> = vec![
        labeled(r"net\s+profit\s+or\s+\(loss\)"),
        labeled(r"net\s+profit"),
        labeled(r"\bline\s*31\b"),
    ];
    static ref RENTS: Vec<Regex> = vec![
        labeled(r"rents\s+received"),
        labeled(r"\bline\s*3\b"),
    ];
    static ref ROYALTIES: Vec<Regex> = vec![
        labeled(r"royalties\s+received"),
        labeled(r"\bline\s*4\b"),
    ];
    static ref E_EXPENSES: Vec<Regex> = vec![
        labeled(r"total\s+expenses"),
        labeled(r"\bline\s*20\b"),
    ];
    static ref E_NET: Vec<Regex> = vec![
        labeled(r"total\s+rental\s+real\s+estate\s+and\s+royalty\s+income\s+or\s+\(loss\)"),
        labeled(r"\bline\s*26\b"),
    ];
}

pub fn extract_schedule_c(text: &str, fields: &mut FinancialFields) {
    fields.deductions = first_positive(text, &C_EXPENSES);
    // A loss written as "(1,200.00)" parses negative and is skipped
    fields.net_profit = first_positive(text, &NET_PROFIT);

    match first_positive(text, &GROSS_RECEIPTS) {
        Some(receipts) => add_source(fields, "Schedule C gross receipts", receipts),
        None => {
            if let Some(profit) = fields.net_profit {
                add_source(fields, "Schedule C net profit", profit);
            }
        }
    }
    fields.income = sum_sources(fields);
}

pub fn extract_schedule_e(text: &str, fields: &mut FinancialFields) {
    if let Some(rents) = first_positive(text, &RENTS) {
        add_source(fields, "Schedule E rents", rents);
    }
    if let Some(royalties) = first_positive(text, &ROYALTIES) {
        add_source(fields, "Schedule E royalties", royalties);
    }
    fields.income = sum_sources(fields);
    fields.deductions = first_positive(text, &E_EXPENSES);
    fields.net_profit = first_positive(text, &E_NET);
}
