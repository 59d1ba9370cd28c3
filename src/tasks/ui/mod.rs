pub(crate) mod cli_deserialize;
pub(crate) mod logging;
