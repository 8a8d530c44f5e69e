pub mod amount;
pub mod identifiers;

pub use amount::{find_amounts, first_positive, labeled, parse_amount, FoundAmount};
pub use identifiers::{extract_ssn, extract_tax_year, find_malformed_ids, id_shape, IdShape};
