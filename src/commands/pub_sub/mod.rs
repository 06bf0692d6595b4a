mod publish;
mod subscribe;

pub use publish::{PubSubArguments, PublishArguments, publish};
pub use subscribe::{SubscribeArguments, UnsubscribeArguments, subscribe, unsubscribe};
