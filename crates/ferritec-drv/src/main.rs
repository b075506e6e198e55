fn main() {
    let args = std::env::args().skip(1);
    let code = ferritec_drv::run(args);
    std::process::exit(code);
}
