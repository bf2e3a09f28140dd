//! Application routing configuration.

use dioxus::prelude::*;

use crate::views::{Dashboard, Navbar, Pairing};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Navbar)]
        #[route("/")]
        Dashboard {},
        #[route("/pairing")]
        Pairing {},
}
