// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Base type of the fixture hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animal {
    pub name: String,
    pub legs: u32,
}

/// Subtype of [`Animal`]: every dog can be viewed as an animal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dog {
    pub name: String,
}

impl Dog {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl From<Dog> for Animal {
    fn from(dog: Dog) -> Self {
        Animal {
            name: dog.name,
            legs: 4,
        }
    }
}

pub fn dog_rex() -> Dog {
    Dog::new("Rex")
}

pub fn dog_fido() -> Dog {
    Dog::new("Fido")
}

pub fn animal_spider() -> Animal {
    Animal {
        name: "Charlotte".to_string(),
        legs: 8,
    }
}
