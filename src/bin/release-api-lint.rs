//! Release `api-lint`: no flags, no arguments.

fn main() -> std::process::ExitCode {
    releaser::release::release_main("api-lint")
}
