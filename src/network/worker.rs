use tokio::sync::mpsc;

use crate::common::{ApiCommand, ApiEvent};

use super::client::ApiClient;

/// Background task that runs UI commands against the API.
pub struct ApiWorker {
    client: ApiClient,
    event_sender: mpsc::Sender<ApiEvent>,
    command_receiver: mpsc::Receiver<ApiCommand>,
}

impl ApiWorker {
    pub fn new(
        client: ApiClient,
        event_sender: mpsc::Sender<ApiEvent>,
        command_receiver: mpsc::Receiver<ApiCommand>,
    ) -> Self {
        Self {
            client,
            event_sender,
            command_receiver,
        }
    }

    /// Runs until every command sender is dropped. Each command gets its own
    /// task, so a slow request never holds up the next one.
    pub async fn run(mut self) {
        log::info!("API worker started");

        while let Some(command) = self.command_receiver.recv().await {
            let client = self.client.clone();
            let event_sender = self.event_sender.clone();
            tokio::spawn(async move {
                let label = command.label();
                let event = execute(&client, command).await;
                if let Err(err) = event_sender.send(event).await {
                    log::warn!("Failed to deliver {label} result to UI: {err}");
                }
            });
        }

        log::info!("API worker stopped");
    }
}

/// Performs one command and turns the outcome into an event.
pub async fn execute(client: &ApiClient, command: ApiCommand) -> ApiEvent {
    match command {
        ApiCommand::Login { username, password } => {
            match client.login(&username, &password).await {
                Ok(token) => ApiEvent::LoggedIn(token),
                Err(err) => ApiEvent::LoginFailed(err.to_string()),
            }
        }
        ApiCommand::LoadPosts => match client.list_posts().await {
            Ok(posts) => ApiEvent::PostsLoaded(posts),
            Err(err) => ApiEvent::PostsFailed(err.to_string()),
        },
        ApiCommand::CreatePost { content } => match client.create_post(&content).await {
            Ok(post) => ApiEvent::PostCreated(post),
            Err(err) => ApiEvent::PostCreateFailed(err.to_string()),
        },
        ApiCommand::UpdatePost(post) => {
            let post_id = post.id;
            match client.update_post(&post).await {
                Ok(post) => ApiEvent::PostUpdated { post_id, post },
                Err(err) => ApiEvent::PostUpdateFailed {
                    post_id,
                    message: err.to_string(),
                },
            }
        }
    }
}
