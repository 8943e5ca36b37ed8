fn main() -> std::process::ExitCode {
    buildyard::run()
}
