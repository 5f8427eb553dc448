mod helpers;
mod objectives;
mod visits;

pub(crate) use objectives::{cmd_objectives, cmd_show};
pub(crate) use visits::cmd_visits;
