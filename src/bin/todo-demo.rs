//! This is an example of how parse-todo can be used.
//! It signs in, displays the to-do list of this user, and optionally adds an item to it.
//!
//! Usage: `todo-demo <server URL> <application ID> <client key> <username> <password> [new item title]`

use parse_todo::config::ParseSettings;
use parse_todo::controller::signal::{signal_channel, SignalReceiver, SignalSender};
use parse_todo::utils::print_list;
use parse_todo::ParseController;


#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 5 {
        eprintln!("Usage: todo-demo <server URL> <application ID> <client key> <username> <password> [new item title]");
        std::process::exit(1);
    }

    let settings = match ParseSettings::new(&args[0], &args[1], &args[2]) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        },
    };

    println!("This will use the following settings:");
    println!("  * URL = {}", settings.server_url);
    println!("  * CLASS = {}", settings.class_name);
    println!("You can set the RUST_LOG environment variable to display more info about the requests.");
    println!();

    let (sender, mut receiver) = signal_channel();
    let controller = parse_todo::parse_controller(settings, sender);

    // Nobody is signed in yet, so this displays an empty list
    let _ = controller.view_appeared().await;
    render(&controller, &mut receiver);

    if controller.request_login(&args[3], &args[4]).await.is_err() {
        print_signals(&mut receiver);
        std::process::exit(2);
    }
    render(&controller, &mut receiver);

    if let Some(title) = args.get(5) {
        let _ = controller.submit_create(title, None).await;
        render(&controller, &mut receiver);
    }

    let _ = controller.request_logout().await;
    print_signals(&mut receiver);
}

fn render(controller: &ParseController<SignalSender>, receiver: &mut SignalReceiver) {
    print_signals(receiver);
    println!("---- To do -----");
    print_list(&controller.snapshot());
}

fn print_signals(receiver: &mut SignalReceiver) {
    while let Ok(signal) = receiver.try_recv() {
        println!("[{}]", signal);
    }
}
