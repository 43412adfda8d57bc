//! SOAP partner `login` handshake.
//!
//! The SOAP endpoint accepts any client identifier, which makes it usable
//! without a connected app. The response carries the session id, the server
//! URL (from which the instance URL is derived) and the user's identity.

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use sflite_client::{parse_error_response, Session, SfHttpClient, UserInfo};
use tracing::{info, instrument, warn};

use crate::credentials::PasswordCredentials;
use crate::error::{Error, ErrorKind, Result};

/// Builds and sends the SOAP login request.
#[derive(Debug, Clone)]
pub struct SoapLogin {
    client_id: String,
    api_version: String,
}

impl SoapLogin {
    /// Create a login call for the given client identifier and API version.
    pub fn new(client_id: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            api_version: api_version.into(),
        }
    }

    /// The SOAP endpoint under a login URL.
    pub fn endpoint(&self, login_url: &str) -> String {
        format!(
            "{}/services/Soap/u/{}",
            login_url.trim_end_matches('/'),
            self.api_version
        )
    }

    /// Render the login envelope. The password is followed directly by the
    /// security token, as the platform expects.
    pub fn envelope(&self, credentials: &PasswordCredentials) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8" ?>
<env:Envelope
        xmlns:xsd="http://www.w3.org/2001/XMLSchema"
        xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
        xmlns:env="http://schemas.xmlsoap.org/soap/envelope/"
        xmlns:urn="urn:partner.soap.sforce.com">
    <env:Header>
        <urn:CallOptions>
            <urn:client>{client}</urn:client>
            <urn:defaultNamespace>sf</urn:defaultNamespace>
        </urn:CallOptions>
    </env:Header>
    <env:Body>
        <n1:login xmlns:n1="urn:partner.soap.sforce.com">
            <n1:username>{username}</n1:username>
            <n1:password>{password}{token}</n1:password>
        </n1:login>
    </env:Body>
</env:Envelope>"#,
            client = escape(self.client_id.as_str()),
            username = escape(credentials.username()),
            password = escape(credentials.password()),
            token = escape(credentials.security_token()),
        )
    }

    /// Log in with a username and password.
    ///
    /// Empty usernames or passwords are rejected before anything is sent. A
    /// non-200 answer is mapped to a typed error from its body.
    #[instrument(skip(self, http, credentials), fields(username = %credentials.username()))]
    pub async fn login(
        &self,
        http: &SfHttpClient,
        credentials: &PasswordCredentials,
    ) -> Result<LoginResult> {
        credentials.validate()?;

        let request = http
            .post(self.endpoint(credentials.login_url()))
            .xml(self.envelope(credentials))
            .header("charset", "UTF-8")
            .header("SOAPAction", "login");

        let response = http.send_raw(&request).await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status != 200 {
            warn!(status, "Login rejected");
            return Err(parse_error_response(status, &body).into());
        }

        let result = parse_login_response(&body)?;
        info!(user = %result.user.user_name, "User authenticated");
        Ok(result)
    }
}

/// A successful login.
///
/// The session id is redacted in Debug output.
#[derive(Clone)]
pub struct LoginResult {
    session_id: String,
    server_url: String,
    instance_url: String,
    user: UserInfo,
}

impl std::fmt::Debug for LoginResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResult")
            .field("session_id", &"[REDACTED]")
            .field("server_url", &self.server_url)
            .field("instance_url", &self.instance_url)
            .field("user", &self.user)
            .finish()
    }
}

impl LoginResult {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The full SOAP server URL returned by the platform.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Scheme, host and port of the server URL.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    pub fn user(&self) -> &UserInfo {
        &self.user
    }

    /// Turn the login into a session usable for REST calls.
    pub fn into_session(self) -> Session {
        Session::new(self.session_id, self.instance_url).with_user(self.user)
    }
}

/// Parse the body of a successful login response.
///
/// Values are read from `Envelope/Body/loginResponse/result`, matching on
/// local names so any namespace prefix is accepted.
pub fn parse_login_response(body: &[u8]) -> Result<LoginResult> {
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut fields = LoginFields::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                path.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned())
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Text(text) => {
                let value = text.unescape()?;
                fields.assign(&path, &value);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    fields.finish()
}

const RESULT_PATH: [&str; 4] = ["Envelope", "Body", "loginResponse", "result"];

#[derive(Default)]
struct LoginFields {
    session_id: Option<String>,
    server_url: Option<String>,
    user: UserInfo,
}

impl LoginFields {
    fn assign(&mut self, path: &[String], value: &str) {
        if path.len() <= RESULT_PATH.len()
            || !path.iter().zip(RESULT_PATH).all(|(a, b)| a == b)
        {
            return;
        }

        let rest: Vec<&str> = path[RESULT_PATH.len()..]
            .iter()
            .map(String::as_str)
            .collect();
        match rest.as_slice() {
            ["sessionId"] => self.session_id = Some(value.to_string()),
            ["serverUrl"] => self.server_url = Some(value.to_string()),
            ["userId"] => self.user.id = value.to_string(),
            ["userInfo", "userEmail"] => self.user.email = value.to_string(),
            ["userInfo", "userFullName"] => self.user.full_name = value.to_string(),
            ["userInfo", "userName"] => self.user.user_name = value.to_string(),
            _ => {}
        }
    }

    fn finish(self) -> Result<LoginResult> {
        let session_id = self
            .session_id
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::new(ErrorKind::Xml("login response has no sessionId".into())))?;
        let server_url = self
            .server_url
            .ok_or_else(|| Error::new(ErrorKind::Xml("login response has no serverUrl".into())))?;
        let instance_url = instance_url_of(&server_url)?;

        Ok(LoginResult {
            session_id,
            server_url,
            instance_url,
            user: self.user,
        })
    }
}

fn instance_url_of(server_url: &str) -> Result<String> {
    let parsed = url::Url::parse(server_url).map_err(|e| {
        Error::with_source(ErrorKind::Xml(format!("invalid serverUrl: {e}")), e)
    })?;
    let host = parsed
        .host_str()
        .ok_or_else(|| Error::new(ErrorKind::Xml("serverUrl has no host".into())))?;

    Ok(match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn login_response(server_url: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="urn:partner.soap.sforce.com" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><soapenv:Body><loginResponse><result><metadataServerUrl>{server_url}/services/Soap/m/54.0/00Dxx0000001gEF</metadataServerUrl><passwordExpired>false</passwordExpired><sandbox>false</sandbox><serverUrl>{server_url}/services/Soap/u/54.0/00Dxx0000001gEF</serverUrl><sessionId>00Dxx0000001gEF!AQ4AQFakeSession</sessionId><userId>005xx000001Sv6eAAC</userId><userInfo><accessibilityMode>false</accessibilityMode><delegatedApproverId xsi:nil="true"/><userEmail>jane@example.com</userEmail><userFullName>Jane Doe</userFullName><userId>005xx000001Sv6eAAC</userId><userName>jane@example.com.dev</userName></userInfo></result></loginResponse></soapenv:Body></soapenv:Envelope>"#
        )
    }

    fn test_http() -> SfHttpClient {
        SfHttpClient::default_client().unwrap()
    }

    #[test]
    fn test_envelope_escapes_password_and_appends_token() {
        let login = SoapLogin::new("sflite", "54.0");
        let creds = PasswordCredentials::new("jane@example.com", "p<a>ss&'\"", "TOKEN123");
        let envelope = login.envelope(&creds);

        assert!(envelope.contains("<urn:client>sflite</urn:client>"));
        assert!(envelope.contains("<n1:username>jane@example.com</n1:username>"));
        assert!(envelope.contains("<n1:password>p&lt;a&gt;ss&amp;&apos;&quot;TOKEN123</n1:password>"));
    }

    #[test]
    fn test_endpoint() {
        let login = SoapLogin::new("sflite", "54.0");
        assert_eq!(
            login.endpoint("https://login.salesforce.com/"),
            "https://login.salesforce.com/services/Soap/u/54.0"
        );
    }

    #[test]
    fn test_parse_login_response() {
        let body = login_response("https://na1.salesforce.com");
        let result = parse_login_response(body.as_bytes()).unwrap();

        assert_eq!(result.session_id(), "00Dxx0000001gEF!AQ4AQFakeSession");
        assert_eq!(result.instance_url(), "https://na1.salesforce.com");
        assert_eq!(result.user().id, "005xx000001Sv6eAAC");
        assert_eq!(result.user().email, "jane@example.com");
        assert_eq!(result.user().full_name, "Jane Doe");
        assert_eq!(result.user().user_name, "jane@example.com.dev");

        let session = result.into_session();
        assert!(session.is_valid());
        assert_eq!(session.instance_url(), "https://na1.salesforce.com");
    }

    #[test]
    fn test_instance_url_keeps_port() {
        assert_eq!(
            instance_url_of("http://127.0.0.1:8080/services/Soap/u/54.0/00D").unwrap(),
            "http://127.0.0.1:8080"
        );
        assert!(instance_url_of("not a url").is_err());
    }

    #[test]
    fn test_missing_session_id_is_decode_error() {
        let body = br#"<Envelope><Body><loginResponse><result><serverUrl>https://na1.salesforce.com/x</serverUrl></result></loginResponse></Body></Envelope>"#;
        let err = parse_login_response(body).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Xml(_)));
    }

    #[test]
    fn test_malformed_xml_is_decode_error() {
        let err = parse_login_response(b"<Envelope><Body></Envelope>").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Xml(_)));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/Soap/u/54.0"))
            .and(header("Content-Type", "text/xml"))
            .and(header("charset", "UTF-8"))
            .and(header("SOAPAction", "login"))
            .and(body_string_contains("<n1:password>secretTOKEN</n1:password>"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(login_response(&mock_server.uri())),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let creds = PasswordCredentials::new("jane@example.com", "secret", "TOKEN")
            .with_login_url(mock_server.uri());
        let result = SoapLogin::new("sflite", "54.0")
            .login(&test_http(), &creds)
            .await
            .unwrap();

        assert_eq!(result.instance_url(), mock_server.uri());
        assert_eq!(result.user().user_name, "jane@example.com.dev");
    }

    #[tokio::test]
    async fn test_login_fault_is_mapped() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/Soap/u/54.0"))
            .respond_with(ResponseTemplate::new(500).set_body_string(
                "<soapenv:Envelope><soapenv:Body><soapenv:Fault><faultcode>INVALID_LOGIN</faultcode>\
                 <faultstring>INVALID_LOGIN: Invalid username, password, security token; or user locked out.</faultstring>\
                 </soapenv:Fault></soapenv:Body></soapenv:Envelope>",
            ))
            .mount(&mock_server)
            .await;

        let creds = PasswordCredentials::new("jane@example.com", "wrong", "")
            .with_login_url(mock_server.uri());
        let err = SoapLogin::new("sflite", "54.0")
            .login(&test_http(), &creds)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("INVALID_LOGIN"));
    }

    #[tokio::test]
    async fn test_login_with_empty_username_sends_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let creds = PasswordCredentials::new("", "secret", "").with_login_url(mock_server.uri());
        let err = SoapLogin::new("sflite", "54.0")
            .login(&test_http(), &creds)
            .await
            .unwrap_err();

        assert!(matches!(err.kind, ErrorKind::InvalidCredentials(_)));
    }
}
