fn main() {
    if let Err(err) = mbti_top10::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
