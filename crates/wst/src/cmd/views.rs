use wst_ipc::ViewQuery;

use crate::cmd::{Context, ViewsArgs};
use crate::exit::{ipc_error, CliResult, SUCCESS};
use crate::output::print_views;

pub fn run(args: ViewsArgs, ctx: &Context) -> CliResult<i32> {
    let mut client = ctx.connect()?;
    let mut views = client
        .list_views()
        .map_err(|err| ipc_error("list_views failed", err))?;

    if let Some(filter) = query(&args) {
        views.retain(|view| filter.matches(view));
    }
    print_views(&views, ctx.format);
    Ok(SUCCESS)
}

fn query(args: &ViewsArgs) -> Option<ViewQuery<'_>> {
    if let Some(app_id) = &args.app_id {
        return Some(ViewQuery::AppId(app_id));
    }
    if let Some(title) = &args.title {
        return Some(ViewQuery::Title(title));
    }
    args.id.map(ViewQuery::Id)
}
