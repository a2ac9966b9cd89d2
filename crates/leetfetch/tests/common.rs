pub fn run_cli(args: &[&str]) -> (String, String, bool) {
    match leetfetch::run_cli(args) {
        Ok(output) => (output.report, String::new(), output.status == 0),
        Err(stderr) => (String::new(), stderr, false),
    }
}
