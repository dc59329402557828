#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PortDirection {
    Input,
    Output,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PortInfo {
    pub name: String,
    pub direction: PortDirection,
}

/// Named parameters an action declares to the host tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PortsList(Vec<PortInfo>);

impl PortsList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.0.push(PortInfo {
            name: name.into(),
            direction: PortDirection::Input,
        });
        self
    }

    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.0.push(PortInfo {
            name: name.into(),
            direction: PortDirection::Output,
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&PortInfo> {
        self.0.iter().find(|port| port.name == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
