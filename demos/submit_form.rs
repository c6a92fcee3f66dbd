use geoform_relay::client::{ClientError, FormClient};
use geoform_relay::validation::FormInput;

use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Sender details from command line arguments
    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        eprintln!("Usage: {} <name> <surname> <email> <message>", args[0]);
        std::process::exit(1);
    }

    let form = FormInput {
        name: args[1].clone(),
        surname: args[2].clone(),
        email: args[3].clone(),
        message: args[4].clone(),
        agree: true,
        ..Default::default()
    };

    let client = FormClient::from_env()?;
    match client.submit(&form).await {
        Ok(message_id) => println!("Sent to {} as {}", client.base_url(), message_id),
        Err(ClientError::Invalid(errors)) => {
            for (field, message) in errors {
                eprintln!("{}: {}", field, message);
            }
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
