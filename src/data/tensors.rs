use crate::data::Tensor;

/// Named model outputs, in the order the engine produced them.
#[derive(Debug, Clone, Default)]
pub struct Tensors {
    names: Vec<String>,
    values: Vec<Tensor>,
}

impl Tensors {
    pub fn new() -> Self {
        Default::default()
    }

    /// Inserts `value` under `name`, replacing a previous entry with the same name.
    pub fn push_kv(&mut self, name: &str, value: Tensor) {
        match self.names.iter().position(|n| n == name) {
            Some(i) => self.values[i] = value,
            None => {
                self.names.push(name.to_string());
                self.values.push(value);
            }
        }
    }

    pub fn with(mut self, name: &str, value: Tensor) -> Self {
        self.push_kv(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.values[i])
    }

    pub fn take(&mut self, name: &str) -> Option<Tensor> {
        let i = self.names.iter().position(|n| n == name)?;
        self.names.remove(i);
        Some(self.values.remove(i))
    }

    pub fn take_first(&mut self) -> Option<Tensor> {
        if self.values.is_empty() {
            return None;
        }
        self.names.remove(0);
        Some(self.values.remove(0))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Tensor> for Tensors {
    fn from(x: Tensor) -> Self {
        Self::new().with("output", x)
    }
}
