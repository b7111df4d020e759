use std::io::Write;

/// CSV table writer; the header is written once, before the first record.
pub(crate) struct CsvOutput<W: Write> {
    writer: csv::Writer<W>,
    initialized: bool,
}

impl<W: Write> CsvOutput<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
            initialized: false,
        }
    }

    pub fn use_header<I, T>(&mut self, header: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        if !self.initialized {
            self.writer.write_record(header)?;
            self.initialized = true;
        }

        anyhow::Ok(())
    }

    pub fn add_record<I, T>(&mut self, values: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer.write_record(values)?;

        anyhow::Ok(())
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;

        anyhow::Ok(())
    }
}

#[cfg(test)]
impl CsvOutput<Vec<u8>> {
    pub fn in_memory() -> Self {
        Self::new(Vec::new())
    }

    pub fn into_string(self) -> String {
        String::from_utf8(self.writer.into_inner().unwrap()).unwrap()
    }
}
