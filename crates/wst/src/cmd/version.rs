use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("wst {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: wst");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target: {}", option_env!("WST_BUILD_TARGET").unwrap_or("unknown"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!("test_namespace: {}", wst_ipc::TEST_NAMESPACE);
    println!("fallback_namespace: {}", wst_ipc::DEFAULT_FALLBACK_NAMESPACE);
    println!("max_payload: {}", wst_frame::DEFAULT_MAX_PAYLOAD);

    Ok(SUCCESS)
}
