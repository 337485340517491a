// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;

use lettre::Message;
use lettre::SmtpTransport;
use lettre::Transport;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;

use crate::Error;
use crate::ErrorKind;
use crate::config::Attributes;
use crate::writer::Constructed;
use crate::writer::Writer;
use crate::writer::invalid_attr;
use crate::writer::required_attr;

const DEFAULT_PORT: u16 = 25;

/// A writer that sends every payload as one plain-text email.
///
/// Place it below a [`Buffer`](crate::writer::Buffer) to mail records in batches.
///
/// With the `native-tls` feature the connection is upgraded with STARTTLS; otherwise the
/// transport talks plain SMTP.
pub struct Smtp {
    transport: SmtpTransport,
    host: String,
    from: Mailbox,
    to: Vec<Mailbox>,
    subject: String,
}

impl fmt::Debug for Smtp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Smtp")
            .field("host", &self.host)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

impl Smtp {
    /// Construct an SMTP writer from the `username`, `password`, `host`, `subject` and `sendTo`
    /// attributes.
    ///
    /// `host` is `name[:port]`; `sendTo` separates recipients with `;`. The username doubles as
    /// the sender address.
    pub(crate) fn construct(attrs: &Attributes) -> Result<Constructed, Error> {
        let username = required_attr(attrs, "username")?;
        let password = required_attr(attrs, "password")?;
        let host = required_attr(attrs, "host")?;
        let send_to = required_attr(attrs, "sendTo")?;
        let subject = attrs.get("subject").cloned().unwrap_or_default();

        let from = username.parse::<Mailbox>().map_err(|err| {
            invalid_attr("username", username, "username must be a mail address").with_source(err)
        })?;

        let to = send_to
            .split(';')
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
            .map(|addr| {
                addr.parse::<Mailbox>().map_err(|err| {
                    invalid_attr("sendTo", addr, "invalid recipient address").with_source(err)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if to.is_empty() {
            return Err(invalid_attr("sendTo", send_to, "at least one recipient is required"));
        }

        let (name, port) = parse_host(host)?;
        let credentials = Credentials::new(username.to_string(), password.to_string());

        #[cfg(feature = "native-tls")]
        let builder = SmtpTransport::starttls_relay(name)
            .map_err(|err| {
                Error::new(ErrorKind::InvalidAttribute, "failed to set up tls relay")
                    .with_context("attribute", "host")
                    .with_source(err)
            })?
            .port(port);
        #[cfg(not(feature = "native-tls"))]
        let builder = SmtpTransport::builder_dangerous(name).port(port);

        Ok(Constructed::leaf(Smtp {
            transport: builder.credentials(credentials).build(),
            host: host.to_string(),
            from,
            to,
            subject,
        }))
    }

    fn message(&self, body: String) -> Result<Message, Error> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(&self.subject)
            .header(ContentType::TEXT_PLAIN);
        for to in &self.to {
            builder = builder.to(to.clone());
        }
        builder.body(body).map_err(|err| {
            Error::new(ErrorKind::Unexpected, "failed to build mail message").with_source(err)
        })
    }
}

fn parse_host(host: &str) -> Result<(&str, u16), Error> {
    match host.rsplit_once(':') {
        None => Ok((host, DEFAULT_PORT)),
        Some((name, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| invalid_attr("host", host, "invalid smtp port"))?;
            Ok((name, port))
        }
    }
}

impl Writer for Smtp {
    fn write(&self, buf: &[u8]) -> Result<usize, Error> {
        let message = self.message(String::from_utf8_lossy(buf).into_owned())?;
        self.transport.send(&message).map_err(|err| {
            Error::new(ErrorKind::Unexpected, "failed to send mail")
                .with_context("host", &self.host)
                .with_source(err)
        })?;
        Ok(buf.len())
    }
}
