use config::Config;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    server: Server,
    ota: Ota,
}

impl AppConfig {
    pub fn load() -> Self {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::default())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    pub fn server(&self) -> &Server {
        &self.server
    }

    pub fn ota(&self) -> &Ota {
        &self.ota
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    address: String,
}

impl Server {
    pub fn address(&self) -> &str {
        &self.address
    }
}

#[derive(Debug, Deserialize)]
pub struct Ota {
    user_agent: String,
    firmware_directory: String,
}

impl Ota {
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn firmware_directory(&self) -> &str {
        &self.firmware_directory
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                server: Server {
                    address: "127.0.0.1:0".to_string(),
                },
                ota: Ota {
                    user_agent: "ESP8266-HTTP-UPDATE".to_string(),
                    firmware_directory: "firmwares".to_string(),
                },
            },
        }
    }

    pub fn firmware_directory(mut self, directory: String) -> Self {
        self.config.ota.firmware_directory = directory;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
