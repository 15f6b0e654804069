use antcore_message::registry;

use crate::cmd::TypesArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_types, OutputFormat};

pub fn run(_args: TypesArgs, format: OutputFormat) -> CliResult<i32> {
    print_types(registry(), format);
    Ok(SUCCESS)
}
