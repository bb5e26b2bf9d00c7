use git_migrate::git_mover_main;
use std::process::exit;

#[tokio::main]
async fn main() {
    println!(concat!(
        env!("CARGO_PKG_NAME"),
        " ",
        env!("CARGO_PKG_VERSION")
    ));
    match git_mover_main().await {
        Ok(_) => {
            exit(0);
        }
        Err(e) if e.is_cancelled() => {
            println!("Migration cancelled");
            exit(0);
        }
        Err(e) => {
            eprintln!("{e}");
            exit(1);
        }
    };
}
