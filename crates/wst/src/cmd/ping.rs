use serde_json::Value;

use crate::cmd::Context;
use crate::exit::{ipc_error, CliResult, FAILURE, SUCCESS};
use crate::output::print_fields;

pub fn run(ctx: &Context) -> CliResult<i32> {
    let mut client = ctx.connect()?;
    let ok = client.ping().map_err(|err| ipc_error("ping failed", err))?;

    print_fields(
        &[
            ("ok", Value::Bool(ok)),
            (
                "server_pid",
                client.server_pid().map(Value::from).unwrap_or(Value::Null),
            ),
        ],
        ctx.format,
    );
    Ok(if ok { SUCCESS } else { FAILURE })
}
