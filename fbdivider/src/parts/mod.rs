//! Part-Number & Link Generator
//!
//! Pure templating over resistance values: the Yageo RC part-number grammar,
//! distributor search URLs, and the resistance notation used on the command
//! line.

pub mod links;
pub mod mpn;
pub mod units;

pub use links::{keyword_link, search_keyword, search_link, search_links, Vendor, VendorLink};
pub use mpn::{mpn, value_code, Package, PartSpec, Tolerance};
pub use units::{format_ohms, parse_resistance};
