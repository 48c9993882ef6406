//! Container plumbing shared by the read and write engines.
pub(crate) mod xml;
pub(crate) mod zip;
