use serde_json::Value;
use wst_ipc::chord_sequence;

use crate::cmd::{Context, PressKeyArgs};
use crate::exit::{ipc_error, CliResult, SUCCESS};
use crate::output::print_fields;

pub fn run(args: PressKeyArgs, ctx: &Context) -> CliResult<i32> {
    let mut client = ctx.connect()?;
    client
        .press_key(&args.combo)
        .map_err(|err| ipc_error("press-key failed", err))?;

    print_fields(
        &[
            ("combo", Value::from(args.combo.as_str())),
            ("transitions", Value::from(chord_sequence(&args.combo).len())),
        ],
        ctx.format,
    );
    Ok(SUCCESS)
}
