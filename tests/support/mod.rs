//! Shared helpers for building masked class-file byte buffers by hand,
//! without needing real `javac` output.

const KEY: [u8; 20] = [
    0xAA, 0x3F, 0xC2, 0x7D, 0x91, 0x4B, 0x6E, 0xF0, 0x12, 0x8D, 0x55, 0x99, 0x0A, 0xDE, 0x6B, 0x3C,
    0x47, 0x81, 0x2F, 0xB4,
];

pub fn mask(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .enumerate()
        .map(|(i, b)| b ^ KEY[i % KEY.len()])
        .collect()
}

/// Accumulates constant-pool entries, then assembles a complete class
/// with a single static `main([Ljava/lang/String;)V` method.
pub struct ClassBuilder {
    pool: Vec<u8>,
    count: u16,
}

impl ClassBuilder {
    pub fn new() -> Self {
        ClassBuilder {
            pool: Vec::new(),
            count: 1,
        }
    }

    pub fn utf8(&mut self, s: &str) -> u16 {
        let idx = self.count;
        self.pool.push(1);
        self.pool.extend((s.len() as u16).to_be_bytes());
        self.pool.extend(s.as_bytes());
        self.count += 1;
        idx
    }

    pub fn string(&mut self, text: &str) -> u16 {
        let utf8 = self.utf8(text);
        let idx = self.count;
        self.pool.push(8);
        self.pool.extend(utf8.to_be_bytes());
        self.count += 1;
        idx
    }

    pub fn class(&mut self, name: &str) -> u16 {
        let name_idx = self.utf8(name);
        let idx = self.count;
        self.pool.push(7);
        self.pool.extend(name_idx.to_be_bytes());
        self.count += 1;
        idx
    }

    pub fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name_idx = self.utf8(name);
        let desc_idx = self.utf8(descriptor);
        let idx = self.count;
        self.pool.push(12);
        self.pool.extend(name_idx.to_be_bytes());
        self.pool.extend(desc_idx.to_be_bytes());
        self.count += 1;
        idx
    }

    pub fn method_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> u16 {
        let class_idx = self.class(owner);
        let nat_idx = self.name_and_type(name, descriptor);
        let idx = self.count;
        self.pool.push(10);
        self.pool.extend(class_idx.to_be_bytes());
        self.pool.extend(nat_idx.to_be_bytes());
        self.count += 1;
        idx
    }

    /// Consumes the builder, producing a masked class named `this_name`
    /// whose only method is `main`, running `code`.
    pub fn finish(mut self, this_name: &str, code: Vec<u8>, max_stack: u16, max_locals: u16) -> Vec<u8> {
        let this_class = self.class(this_name);
        let main_name = self.utf8("main");
        let main_descriptor = self.utf8("([Ljava/lang/String;)V");
        let code_attr_name = self.utf8("Code");

        let mut raw = Vec::new();
        raw.extend(0xCAFE_BABEu32.to_be_bytes());
        raw.extend(0u16.to_be_bytes()); // minor
        raw.extend(68u16.to_be_bytes()); // major

        raw.extend(self.count.to_be_bytes());
        raw.extend(self.pool);

        raw.extend(0u16.to_be_bytes()); // access_flags
        raw.extend(this_class.to_be_bytes());
        raw.extend(0u16.to_be_bytes()); // super_class
        raw.extend(0u16.to_be_bytes()); // interfaces_count
        raw.extend(0u16.to_be_bytes()); // fields_count

        raw.extend(1u16.to_be_bytes()); // methods_count
        raw.extend(0x0008u16.to_be_bytes()); // access_flags: static
        raw.extend(main_name.to_be_bytes());
        raw.extend(main_descriptor.to_be_bytes());
        raw.extend(1u16.to_be_bytes()); // attributes_count
        raw.extend(code_attr_name.to_be_bytes());

        let mut code_body = Vec::new();
        code_body.extend(max_stack.to_be_bytes());
        code_body.extend(max_locals.to_be_bytes());
        code_body.extend((code.len() as u32).to_be_bytes());
        code_body.extend(code);
        code_body.extend(0u16.to_be_bytes()); // exception_table_length
        code_body.extend(0u16.to_be_bytes()); // sub-attributes count

        raw.extend((code_body.len() as u32).to_be_bytes());
        raw.extend(code_body);

        mask(&raw)
    }
}
