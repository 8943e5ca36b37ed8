use crate::paths::BuildyardHome;

use super::args::Cli;

pub(crate) mod checkout;
pub(crate) mod doctor;

pub(crate) struct Ctx<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) home: &'a BuildyardHome,
}
