use crate::{commands::CommandError, resp::RespValue};

/// A client request: an upper-cased command name and its string arguments.
#[derive(Debug, PartialEq, Clone)]
pub struct Command {
    pub name: String,
    pub arguments: Vec<String>,
}

impl Command {
    pub fn new<N, I, S>(name: N, arguments: I) -> Self
    where
        N: AsRef<str>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.as_ref().to_uppercase(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_uppercase(),
            arguments: Vec::new(),
        }
    }

    /// Builds a command from a RESP array of bulk strings.
    pub fn from_resp(input: RespValue) -> Result<Self, CommandError> {
        let RespValue::Array(elements) = input else {
            return Err(CommandError::InvalidArgument(
                "commands must be sent as arrays of bulk strings".to_string(),
            ));
        };

        let mut elements = elements.into_iter();

        let name = match elements.next() {
            Some(RespValue::BulkString(s)) => s.to_uppercase(),
            Some(_) => {
                return Err(CommandError::InvalidArgument(
                    "command name must be a bulk string".to_string(),
                ))
            }
            None => return Err(CommandError::UnknownCommand(String::new())),
        };

        let mut arguments: Vec<String> = Vec::new();

        for element in elements {
            let arg = match element {
                RespValue::BulkString(s) => Ok(s),
                RespValue::Integer(i) => Ok(i.to_string()),
                _ => Err(CommandError::InvalidArgument(
                    "command arguments must be bulk strings".to_string(),
                )),
            }?;

            arguments.push(arg);
        }

        Ok(Self { name, arguments })
    }

    /// The RESP form a client sends for this command.
    pub fn to_resp(&self) -> RespValue {
        let name = std::iter::once(self.name.clone());
        RespValue::bulk_array(name.chain(self.arguments.iter().cloned()))
    }
}
