use serde_json::{Map, Value};

use crate::cmd::{CallArgs, Context};
use crate::exit::{ipc_error, CliError, CliResult, FAILURE, SUCCESS, USAGE};
use crate::output::print_response;

pub fn run(args: CallArgs, ctx: &Context) -> CliResult<i32> {
    let data = parse_data(args.json.as_deref())?;
    let mut client = ctx.connect()?;

    let response = if args.checked {
        client.call_checked(&args.method, data)
    } else {
        client.call(&args.method, data)
    }
    .map_err(|err| ipc_error("call failed", err))?;

    print_response(&response, ctx.format);
    Ok(if response.is_error() { FAILURE } else { SUCCESS })
}

fn parse_data(json: Option<&str>) -> CliResult<Map<String, Value>> {
    let Some(json) = json else {
        return Ok(Map::new());
    };
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CliError::new(USAGE, "--json must be a JSON object")),
        Err(err) => Err(CliError::new(
            USAGE,
            format!("--json is not valid JSON: {err}"),
        )),
    }
}
