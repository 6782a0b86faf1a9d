//! Patterns for typeable lines as printed on slips.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // AAAAA.AAAAA BBBBB.BBBBBB CCCCC.CCCCCC D EEEEEEEEEEEEEE, separators optional.
    // ASCII digits only: `\d` would also accept other Unicode digits.
    pub static ref TYPEABLE_LINE: Regex = Regex::new(
        r"^([0-9]{5})\.?([0-9]{5})\s*([0-9]{5})\.?([0-9]{6})\s*([0-9]{5})\.?([0-9]{6})\s*([0-9])\s*([0-9]{14})$"
    ).unwrap();
}
