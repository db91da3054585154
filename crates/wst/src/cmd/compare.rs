use serde_json::Value;
use wst_observe::{compare_images, ImageDiff};

use crate::cmd::CompareArgs;
use crate::exit::{observe_error, CliResult, DATA_INVALID, IMAGES_DIFFER, SUCCESS};
use crate::output::{print_fields, OutputFormat};

pub fn run(args: CompareArgs, format: OutputFormat) -> CliResult<i32> {
    let outcome = compare_images(&args.first, &args.second, &args.diff, args.sensitivity)
        .map_err(|err| observe_error("compare failed", err))?;

    let mut fields = vec![("outcome", Value::from(outcome_name(outcome)))];
    if outcome == ImageDiff::Different {
        fields.push(("diff", Value::from(args.diff.display().to_string())));
    }
    print_fields(&fields, format);

    Ok(match outcome {
        ImageDiff::Same => SUCCESS,
        ImageDiff::Different => IMAGES_DIFFER,
        ImageDiff::SizeMismatch => DATA_INVALID,
    })
}

fn outcome_name(outcome: ImageDiff) -> &'static str {
    match outcome {
        ImageDiff::Same => "same",
        ImageDiff::Different => "different",
        ImageDiff::SizeMismatch => "size-mismatch",
    }
}
