pub mod device;
pub mod expiry;
pub mod ext;
pub mod imp;
pub mod request;
pub mod site;
pub mod source;
pub mod user;

pub use device::{Device, Geo};
pub use ext::Ext;
pub use imp::{Audio, Banner, Deal, Format, Imp, MediaKind, Metric, Native, Pmp, Video};
pub use request::{AuctionType, BidRequest};
pub use site::{App, Content, Producer, Publisher, Site};
pub use source::{Regs, Source};
pub use user::{Data, Segment, User};
